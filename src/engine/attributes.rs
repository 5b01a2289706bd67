//! Experimental attribute derivation.
//!
//! Synthesizes well-known attributes (mostly ARNs) from a resource's type and
//! physical id. The results are guesses built from naming conventions, not
//! facts returned by the control plane, so this is only consulted when the
//! resolver is built with attribute heuristics enabled. Attribute overrides
//! always win over anything derived here.

use indexmap::IndexMap;

use crate::expression::pseudo::{partition_for_region, url_suffix_for_partition};
use crate::expression::Scalar;
use crate::inventory::{ResourceRecord, StackIdentity};
use crate::utils::last_segment;

/// Attributes derivable for `resource`. Empty when the type is unknown or the
/// resource has no physical id.
pub fn derive_attributes(
    resource: &ResourceRecord,
    identity: &StackIdentity,
) -> IndexMap<String, Scalar> {
    let mut attributes = IndexMap::new();
    let Some(id) = resource.physical_id.as_deref() else {
        return attributes;
    };

    let partition = if identity.partition.is_empty() {
        partition_for_region(&identity.region)
    } else {
        identity.partition.as_str()
    };
    let region = identity.region.as_str();
    let account = identity.account_id.as_str();
    let mut put = |name: &str, value: String| {
        attributes.insert(name.to_string(), Scalar::String(value));
    };

    match resource.resource_type.as_str() {
        "AWS::DynamoDB::Table" => {
            put("Arn", format!("arn:{partition}:dynamodb:{region}:{account}:table/{id}"));
        }
        "AWS::SQS::Queue" => {
            let name = last_segment(id, '/');
            put("Arn", format!("arn:{partition}:sqs:{region}:{account}:{name}"));
            put("QueueName", name.to_string());
            put("QueueUrl", id.to_string());
        }
        "AWS::SNS::Topic" => {
            put("TopicArn", id.to_string());
            put("TopicName", last_segment(id, ':').to_string());
        }
        "AWS::S3::Bucket" => {
            let suffix = url_suffix_for_partition(partition);
            put("Arn", format!("arn:{partition}:s3:::{id}"));
            put("DomainName", format!("{id}.s3.{suffix}"));
            put("RegionalDomainName", format!("{id}.s3.{region}.{suffix}"));
        }
        "AWS::Lambda::Function" => {
            put("Arn", format!("arn:{partition}:lambda:{region}:{account}:function:{id}"));
        }
        "AWS::IAM::Role" => {
            put("Arn", format!("arn:{partition}:iam::{account}:role/{id}"));
        }
        "AWS::Kinesis::Stream" => {
            put("Arn", format!("arn:{partition}:kinesis:{region}:{account}:stream/{id}"));
        }
        "AWS::Logs::LogGroup" => {
            put("Arn", format!("arn:{partition}:logs:{region}:{account}:log-group:{id}:*"));
        }
        other => {
            tracing::trace!("No attribute heuristics for resource type {other}");
        }
    }

    attributes
}

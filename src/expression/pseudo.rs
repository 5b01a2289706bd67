/// Pseudo-parameters resolved from deployment context rather than from a
/// named resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoParameter {
    Region,
    AccountId,
    StackId,
    StackName,
    Partition,
    UrlSuffix,
}

pub const DEFAULT_PARTITION: &str = "aws";
pub const DEFAULT_URL_SUFFIX: &str = "amazonaws.com";

impl PseudoParameter {
    pub const ALL: [PseudoParameter; 6] = [
        Self::Region,
        Self::AccountId,
        Self::StackId,
        Self::StackName,
        Self::Partition,
        Self::UrlSuffix,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Region => "AWS::Region",
            Self::AccountId => "AWS::AccountId",
            Self::StackId => "AWS::StackId",
            Self::StackName => "AWS::StackName",
            Self::Partition => "AWS::Partition",
            Self::UrlSuffix => "AWS::URLSuffix",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }

    pub fn is_pseudo(name: &str) -> bool {
        Self::from_name(name).is_some()
    }
}

impl std::fmt::Display for PseudoParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Partition a region belongs to.
pub fn partition_for_region(region: &str) -> &'static str {
    if region.starts_with("cn-") {
        "aws-cn"
    } else if region.starts_with("us-gov-") {
        "aws-us-gov"
    } else {
        DEFAULT_PARTITION
    }
}

pub fn url_suffix_for_partition(partition: &str) -> &'static str {
    match partition {
        "aws-cn" => "amazonaws.com.cn",
        _ => DEFAULT_URL_SUFFIX,
    }
}

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchCategory {
    Feature,
    Bugfix,
}

impl BranchCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchCategory::Feature => "feature",
            BranchCategory::Bugfix => "bugfix",
        }
    }

    /// Issues whose title mentions "bug" in any case live on a bugfix branch.
    pub fn from_summary(summary: &str) -> Self {
        if summary.to_lowercase().contains("bug") {
            BranchCategory::Bugfix
        } else {
            BranchCategory::Feature
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchName(pub String);

impl BranchName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn for_issue(issue_key: &str, summary: &str) -> Self {
        let category = BranchCategory::from_summary(summary);
        Self(format!("{}/{}", category.as_str(), issue_key))
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

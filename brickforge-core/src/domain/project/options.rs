// brickforge-core/src/domain/project/options.rs

// Every enum-valued option of the template. The string forms are the exact
// values accepted in the JSON config and echoed back in bundle_init_config.json.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $name:ident => $key:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Config key this option is read from.
            pub const KEY: &'static str = $key;
            /// Legal values, in declaration order.
            pub const VALUES: &'static [&'static str] = &[$($value),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $value, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $value => Ok(Self::$variant), )+
                    _ => Err(DomainError::InvalidOption {
                        option: Self::KEY.to_string(),
                        value: s.to_string(),
                        expected: Self::VALUES.join(", "),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

option_enum! {
    /// Which long-lived environments exist besides the per-user one.
    EnvironmentSetup => "environment_setup" {
        /// user + stage
        Minimal => "minimal",
        /// user + stage + prod
        Full => "full",
    }
}

option_enum! {
    /// Plain yes/no switch used by several options.
    Toggle => "yes_no" {
        Yes => "yes",
        No => "no",
    }
}

option_enum! {
    ComputeType => "compute_type" {
        Serverless => "serverless",
        Classic => "classic",
        Both => "both",
    }
}

option_enum! {
    CicdPlatform => "cicd_platform" {
        Disabled => "none",
        AzureDevops => "azure_devops",
        GithubActions => "github_actions",
        Gitlab => "gitlab",
    }
}

option_enum! {
    CloudProvider => "cloud_provider" {
        Azure => "azure",
        Aws => "aws",
        Gcp => "gcp",
    }
}

option_enum! {
    WorkspaceSetup => "workspace_setup" {
        SingleWorkspace => "single_workspace",
        MultiWorkspace => "multi_workspace",
    }
}

impl Toggle {
    pub fn is_yes(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl EnvironmentSetup {
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full)
    }
}

impl ComputeType {
    pub fn uses_serverless(&self) -> bool {
        matches!(self, Self::Serverless | Self::Both)
    }

    pub fn uses_classic(&self) -> bool {
        matches!(self, Self::Classic | Self::Both)
    }
}

impl CicdPlatform {
    pub const ACTIVE: [CicdPlatform; 3] = [Self::AzureDevops, Self::GithubActions, Self::Gitlab];

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Human-facing product name, used in the generated docs.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Disabled => "None",
            Self::AzureDevops => "Azure DevOps",
            Self::GithubActions => "GitHub Actions",
            Self::Gitlab => "GitLab",
        }
    }
}

impl WorkspaceSetup {
    pub fn is_multi(&self) -> bool {
        matches!(self, Self::MultiWorkspace)
    }
}

/// One row of the option catalogue printed by `brickforge options`.
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub key: &'static str,
    pub values: &'static [&'static str],
    pub default: &'static str,
    pub description: &'static str,
}

pub const OPTION_CATALOG: &[OptionSpec] = &[
    OptionSpec {
        key: "project_name",
        values: &[],
        default: "(required)",
        description: "Bundle name, project directory and resource file prefix",
    },
    OptionSpec {
        key: EnvironmentSetup::KEY,
        values: EnvironmentSetup::VALUES,
        default: "full",
        description: "minimal = user + stage, full = user + stage + prod",
    },
    OptionSpec {
        key: "include_dev_environment",
        values: Toggle::VALUES,
        default: "no",
        description: "Adds a shared dev target deployed by its own service principal",
    },
    OptionSpec {
        key: ComputeType::KEY,
        values: ComputeType::VALUES,
        default: "serverless",
        description: "Compute blocks emitted in jobs and pipelines",
    },
    OptionSpec {
        key: "include_permissions",
        values: Toggle::VALUES,
        default: "yes",
        description: "Emit target permissions blocks and group variables",
    },
    OptionSpec {
        key: "configure_sp_now",
        values: Toggle::VALUES,
        default: "no",
        description: "Embed service principal ids now instead of SP_PLACEHOLDER",
    },
    OptionSpec {
        key: CicdPlatform::KEY,
        values: CicdPlatform::VALUES,
        default: "azure_devops",
        description: "CI/CD system whose pipeline definition is populated",
    },
    OptionSpec {
        key: CloudProvider::KEY,
        values: CloudProvider::VALUES,
        default: "azure",
        description: "Selects CI authentication variables and node type defaults",
    },
    OptionSpec {
        key: WorkspaceSetup::KEY,
        values: WorkspaceSetup::VALUES,
        default: "single_workspace",
        description: "multi_workspace leaves a host placeholder per shared target",
    },
    OptionSpec {
        key: "uc_catalog_suffix",
        values: &[],
        default: "my_domain",
        description: "Suffix of the dev_/stage_/prod_ Unity Catalog catalogs",
    },
    OptionSpec {
        key: "default_branch",
        values: &[],
        default: "main",
        description: "Branch whose pushes deploy to stage",
    },
    OptionSpec {
        key: "release_branch",
        values: &[],
        default: "release",
        description: "Branch whose pushes deploy to prod (full setup only)",
    },
    OptionSpec {
        key: "workspace_host",
        values: &[],
        default: "$DATABRICKS_HOST",
        description: "Host of the current workspace, bound to the user target",
    },
    OptionSpec {
        key: "databricks_cli_version",
        values: &[],
        default: "0.240.0",
        description: "Databricks CLI version installed by every CI job",
    },
    OptionSpec {
        key: "dev_service_principal / stage_service_principal / prod_service_principal",
        values: &[],
        default: "(none)",
        description: "Service principal application ids, used when configure_sp_now = yes",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parsing_consistency() -> anyhow::Result<()> {
        for value in CicdPlatform::VALUES {
            let parsed: CicdPlatform = value.parse()?;
            assert_eq!(parsed.as_str(), *value);
        }
        assert_eq!(CicdPlatform::Disabled.to_string(), "none");
        assert_eq!("multi_workspace".parse::<WorkspaceSetup>()?, WorkspaceSetup::MultiWorkspace);
        Ok(())
    }

    #[test]
    fn test_unknown_value_names_option_and_choices() {
        let err = "sometimes".parse::<ComputeType>().err();
        match err {
            Some(DomainError::InvalidOption {
                option,
                value,
                expected,
            }) => {
                assert_eq!(option, "compute_type");
                assert_eq!(value, "sometimes");
                assert_eq!(expected, "serverless, classic, both");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_values_are_case_sensitive() {
        assert!("Full".parse::<EnvironmentSetup>().is_err());
        assert!("YES".parse::<Toggle>().is_err());
    }

    #[test]
    fn test_serde_uses_string_forms() -> anyhow::Result<()> {
        let json = serde_json::to_string(&CicdPlatform::GithubActions)?;
        assert_eq!(json, "\"github_actions\"");

        let parsed: CloudProvider = serde_json::from_str("\"gcp\"")?;
        assert_eq!(parsed, CloudProvider::Gcp);

        let err = serde_json::from_str::<CloudProvider>("\"oracle\"");
        assert!(err.is_err());
        Ok(())
    }

    #[test]
    fn test_compute_predicates() {
        assert!(ComputeType::Both.uses_serverless());
        assert!(ComputeType::Both.uses_classic());
        assert!(!ComputeType::Classic.uses_serverless());
        assert!(!ComputeType::Serverless.uses_classic());
    }
}

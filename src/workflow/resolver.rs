//! Datalake → environment → backup location lookups

use tracing::{debug, info, warn};

use super::error::{ResolutionError, Result};
use super::types::EnvironmentContext;
use crate::client::{BackupService, EnvironmentSummary};
use crate::client::models::is_present;
use crate::config::ResolverConfig;

fn display_name(env: &EnvironmentSummary) -> String {
    env.environment_name
        .as_deref()
        .filter(|name| is_present(name))
        .unwrap_or("<unnamed>")
        .to_string()
}

pub struct Resolver<'a, S: ?Sized> {
    service: &'a S,
    config: ResolverConfig,
}

impl<'a, S: BackupService + ?Sized> Resolver<'a, S> {
    pub fn new(service: &'a S, config: ResolverConfig) -> Self {
        Self { service, config }
    }

    /// Environment CRN recorded on the datalake
    pub async fn resolve_environment_crn(&self, datalake_name: &str) -> Result<String> {
        let description = self.service.describe_datalake(datalake_name).await?;

        let crn = description
            .datalake
            .environment_crn
            .filter(|crn| is_present(crn))
            .ok_or_else(|| ResolutionError::MissingEnvironmentCrn {
                datalake: datalake_name.to_string(),
            })?;

        debug!(datalake = datalake_name, crn = %crn, "Resolved environment CRN");
        Ok(crn)
    }

    /// Name of the single environment whose CRN equals `crn`
    pub async fn resolve_environment_name(&self, crn: &str) -> Result<String> {
        let list = self.service.list_environments().await?;

        let matches: Vec<EnvironmentSummary> = list
            .environments
            .into_iter()
            .filter(|env| env.crn.as_deref() == Some(crn))
            .collect();

        let chosen = match matches.len() {
            0 => {
                return Err(ResolutionError::EnvironmentNotFound {
                    crn: crn.to_string(),
                }
                .into());
            }
            1 => &matches[0],
            _ if self.config.strict_environment_match => {
                return Err(ResolutionError::AmbiguousEnvironment {
                    crn: crn.to_string(),
                    matches: matches.iter().map(display_name).collect(),
                }
                .into());
            }
            count => {
                warn!(
                    crn,
                    count,
                    chosen = %display_name(&matches[0]),
                    "CRN matches several environments, using the first"
                );
                &matches[0]
            }
        };

        chosen
            .environment_name
            .as_deref()
            .filter(|name| is_present(name))
            .map(str::to_string)
            .ok_or_else(|| {
                ResolutionError::UnnamedEnvironment {
                    crn: crn.to_string(),
                }
                .into()
            })
    }

    /// Backup storage base location configured on the environment
    pub async fn resolve_backup_location(&self, environment_name: &str) -> Result<String> {
        let description = self.service.describe_environment(environment_name).await?;

        description
            .environment
            .backup_storage
            .as_ref()
            .and_then(|storage| storage.base_location())
            .map(|location| location.trim().to_string())
            .ok_or_else(|| {
                ResolutionError::MissingBackupLocation {
                    environment: environment_name.to_string(),
                }
                .into()
            })
    }

    /// Run all three lookups in order
    pub async fn resolve(&self, datalake_name: &str) -> Result<EnvironmentContext> {
        let environment_crn = self.resolve_environment_crn(datalake_name).await?;
        let environment_name = self.resolve_environment_name(&environment_crn).await?;
        let backup_location = self.resolve_backup_location(&environment_name).await?;

        info!(
            datalake = datalake_name,
            environment = %environment_name,
            location = %backup_location,
            "Resolved backup location"
        );

        Ok(EnvironmentContext {
            datalake_name: datalake_name.to_string(),
            environment_crn,
            environment_name,
            backup_location,
        })
    }
}

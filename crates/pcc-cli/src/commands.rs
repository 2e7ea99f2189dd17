use anyhow::{anyhow, bail, Result};
use pcc_client::{ClientConfig, HttpPolicyClient, PolicyClient};
use pcc_resource::{parse, ComplianceContainerPolicy, PolicyConfig, ResourceData};
use std::future::Future;
use std::path::Path;
use std::time::Duration;

use crate::state::StateFile;

/// Create the policy when the state is empty, update it otherwise.
pub async fn apply(provider: &Path, state_path: &Path, config_path: &Path) -> Result<()> {
    let config = PolicyConfig::from_file(path_str(config_path)?)?;
    let state = StateFile::new(state_path);
    let existing = state.load()?;
    let resource = connect(provider).await?;
    apply_with(&resource, &state, existing, config).await
}

async fn apply_with<C: PolicyClient>(
    resource: &ComplianceContainerPolicy<C>,
    state: &StateFile,
    existing: Option<ResourceData>,
    config: PolicyConfig,
) -> Result<()> {
    let timeouts = resource.timeouts();

    match existing {
        Some(mut data) if data.is_created() => {
            data.set_config(config);
            within("update", timeouts.update, resource.update(&mut data)).await?;
            state.save(&data)?;
            println!("Updated policy: {} rules", data.rule.len());
        }
        _ => {
            let mut data = ResourceData::from_config(config);
            let result = within("create", timeouts.create, resource.create(&mut data)).await;
            // Once the console accepted the rules the id is set; keep it even
            // if the refresh afterwards failed.
            if data.is_created() {
                state.save(&data)?;
            }
            result?;
            println!("Created policy: {} rules", data.rule.len());
        }
    }

    Ok(())
}

pub async fn refresh(provider: &Path, state_path: &Path) -> Result<()> {
    let state = StateFile::new(state_path);
    let data = managed(&state, state_path)?;
    let resource = connect(provider).await?;
    refresh_with(&resource, &state, data).await
}

fn managed(state: &StateFile, state_path: &Path) -> Result<ResourceData> {
    state
        .load()?
        .filter(ResourceData::is_created)
        .ok_or_else(|| {
            anyhow!(
                "No managed policy in {}; run apply or import first",
                state_path.display()
            )
        })
}

async fn refresh_with<C: PolicyClient>(
    resource: &ComplianceContainerPolicy<C>,
    state: &StateFile,
    mut data: ResourceData,
) -> Result<()> {
    within("read", resource.timeouts().read, resource.read(&mut data)).await?;
    state.save(&data)?;
    println!("Refreshed policy: {} rules", data.rule.len());
    Ok(())
}

pub async fn import(provider: &Path, state_path: &Path, id: &str) -> Result<()> {
    let state = StateFile::new(state_path);
    ensure_unmanaged(&state, state_path)?;
    let resource = connect(provider).await?;
    import_with(&resource, &state, id).await
}

fn ensure_unmanaged(state: &StateFile, state_path: &Path) -> Result<()> {
    if let Some(current) = state.load()?.and_then(|existing| existing.id) {
        bail!(
            "State {} already manages policy {}",
            state_path.display(),
            current
        );
    }
    Ok(())
}

async fn import_with<C: PolicyClient>(
    resource: &ComplianceContainerPolicy<C>,
    state: &StateFile,
    id: &str,
) -> Result<()> {
    let mut data = pcc_resource::import(id);
    within("read", resource.timeouts().read, resource.read(&mut data)).await?;
    state.save(&data)?;
    println!("Imported policy {}: {} rules", id, data.rule.len());
    Ok(())
}

pub async fn destroy(provider: &Path, state_path: &Path) -> Result<()> {
    let state = StateFile::new(state_path);
    let Some(data) = state.load()? else {
        println!("Nothing to destroy");
        return Ok(());
    };

    let resource = connect(provider).await?;
    destroy_with(&resource, &state, &data).await
}

async fn destroy_with<C: PolicyClient>(
    resource: &ComplianceContainerPolicy<C>,
    state: &StateFile,
    data: &ResourceData,
) -> Result<()> {
    within("delete", resource.timeouts().delete, resource.delete(data)).await?;
    state.remove()?;
    println!("Policy no longer managed; console rules left unchanged");
    Ok(())
}

/// Parse the config without contacting the console.
pub fn validate(config_path: &Path) -> Result<()> {
    let config = PolicyConfig::from_file(path_str(config_path)?)?;
    let policy = parse(&config.rule)?;
    println!(
        "{} is valid: {} rules",
        config_path.display(),
        policy.rules.len()
    );
    Ok(())
}

async fn connect(provider: &Path) -> Result<ComplianceContainerPolicy<HttpPolicyClient>> {
    let config = load_provider(provider)?;
    tracing::info!("Connecting to console at {}", config.base_url());
    let client = HttpPolicyClient::connect(&config).await?;
    Ok(ComplianceContainerPolicy::new(client))
}

fn load_provider(provider: &Path) -> Result<ClientConfig> {
    if provider.exists() {
        tracing::info!("Loading provider config from: {}", provider.display());
        Ok(ClientConfig::from_file(path_str(provider)?)?.apply_env())
    } else {
        tracing::debug!(
            "Provider config {} not found, using environment",
            provider.display()
        );
        Ok(ClientConfig::from_env())
    }
}

/// Bound a lifecycle step by the resource's declared timeout.
async fn within<F, T>(step: &str, limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = pcc_resource::Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(anyhow!("{} timed out after {}s", step, limit.as_secs())),
    }
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| anyhow!("Invalid path: {}", path.display()))
}

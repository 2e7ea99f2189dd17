use pcc_client::PolicyClient;
use pcc_policy::POLICY_TYPE_COMPLIANCE_CONTAINER;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{Action, ResourceError, Result};
use crate::mapping::{flatten, parse};
use crate::schema::ResourceData;

/// Identifier of the managed resource; always the policy type.
pub const RESOURCE_ID: &str = POLICY_TYPE_COMPLIANCE_CONTAINER;

/// Host default when a lifecycle step declares no bound of its own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20 * 60);

/// Upper bounds the host waits for each lifecycle step.
///
/// The resource only declares these; enforcing them is up to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceTimeouts {
    pub create: Duration,
    pub read: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl Default for ResourceTimeouts {
    fn default() -> Self {
        ResourceTimeouts {
            create: Duration::from_secs(10 * 60),
            read: DEFAULT_TIMEOUT,
            update: Duration::from_secs(10 * 60),
            delete: Duration::from_secs(5 * 60),
        }
    }
}

/// The account-wide container compliance policy as a single managed object.
///
/// There is one such policy per console. Its identifier is the policy type
/// and never changes.
pub struct ComplianceContainerPolicy<C> {
    client: C,
    timeouts: ResourceTimeouts,
}

/// Passthrough import: the given id becomes the resource id as-is.
/// The host follows up with a read.
pub fn import(id: &str) -> ResourceData {
    if id != RESOURCE_ID {
        tracing::warn!("Importing {} policy under non-standard id {:?}", RESOURCE_ID, id);
    }
    ResourceData {
        id: Some(id.to_string()),
        rule: Vec::new(),
    }
}

impl<C> ComplianceContainerPolicy<C> {
    pub fn new(client: C) -> Self {
        ComplianceContainerPolicy {
            client,
            timeouts: ResourceTimeouts::default(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn timeouts(&self) -> ResourceTimeouts {
        self.timeouts
    }
}

impl<C: PolicyClient> ComplianceContainerPolicy<C> {
    /// Replace the console rule set with the configured rules, then refresh.
    ///
    /// The id is set as soon as the console accepts the rules, so a failed
    /// refresh still leaves `data` marked as created.
    #[tracing::instrument(name = "create", skip_all, fields(operation_id = %Uuid::new_v4()))]
    pub async fn create(&self, data: &mut ResourceData) -> Result<()> {
        self.apply(Action::Create, data).await?;
        data.id = Some(RESOURCE_ID.to_string());
        tracing::info!("Created {} policy", RESOURCE_ID);
        self.read(data).await
    }

    /// Fetch the console rule set and overwrite the local rules with it.
    ///
    /// On failure `data` is left as it was.
    #[tracing::instrument(name = "read", skip_all, fields(operation_id = %Uuid::new_v4()))]
    pub async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let policy = self
            .client
            .get_compliance_container()
            .await
            .map_err(|source| ResourceError::Remote {
                action: Action::Read,
                source,
            })?;

        data.rule = flatten(&policy.rules);
        tracing::info!("Read {} policy: {} rules", RESOURCE_ID, data.rule.len());
        Ok(())
    }

    /// Same whole-policy replace as create; the identifier is kept.
    #[tracing::instrument(name = "update", skip_all, fields(operation_id = %Uuid::new_v4()))]
    pub async fn update(&self, data: &mut ResourceData) -> Result<()> {
        self.apply(Action::Update, data).await?;
        tracing::info!("Updated {} policy", RESOURCE_ID);
        self.read(data).await
    }

    /// Leaves the console policy in place.
    // TODO: reset the console to its default container compliance policy
    // once the default rule payload is known.
    pub async fn delete(&self, _data: &ResourceData) -> Result<()> {
        tracing::warn!(
            "Delete of {} policy leaves the console rules unchanged",
            RESOURCE_ID
        );
        Ok(())
    }

    async fn apply(&self, action: Action, data: &ResourceData) -> Result<()> {
        let policy =
            parse(&data.rule).map_err(|source| ResourceError::Schema { action, source })?;

        tracing::debug!("Sending {} rules", policy.rules.len());
        self.client
            .update_compliance_container(&policy)
            .await
            .map_err(|source| ResourceError::Remote { action, source })
    }
}

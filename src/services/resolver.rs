//! Find-or-create resolution of areas, machines and OEMs by natural key.
//!
//! Uniqueness is enforced by the database. When two callers race to create
//! the same record, the loser's insert fails and it re-reads the winner's
//! row instead.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::config::UploadSettings;
use crate::db::DbPool;
use crate::entity::{area, machine, oem};
use crate::error::{AppError, AppResult};

/// Natural key of a resolvable entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Area {
        name: String,
    },
    Machine {
        name: String,
        machine_no: String,
        area_id: Uuid,
    },
    Oem {
        name: String,
    },
}

/// Trim and uppercase an area name.
pub fn normalize_area_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Resolves natural keys to record ids, creating records on first sight.
#[derive(Clone)]
pub struct EntityResolver {
    pool: DbPool,
    allowed_areas: Option<Arc<[String]>>,
}

impl EntityResolver {
    /// `allowed_areas` must already be normalized; `None` accepts any area.
    pub fn new(pool: DbPool, allowed_areas: Option<Vec<String>>) -> Self {
        Self {
            pool,
            allowed_areas: allowed_areas.map(Arc::from),
        }
    }

    pub fn from_settings(pool: DbPool, settings: &UploadSettings) -> Self {
        Self::new(pool, settings.allowed_areas.clone())
    }

    /// Resolve any key to its record id.
    pub async fn resolve(&self, key: &EntityKey) -> AppResult<Uuid> {
        match key {
            EntityKey::Area { name } => self.resolve_area(name).await.map(|a| a.id),
            EntityKey::Machine {
                name,
                machine_no,
                area_id,
            } => self
                .resolve_machine(name, machine_no, *area_id)
                .await
                .map(|m| m.id),
            EntityKey::Oem { name } => self.resolve_oem(name, None).await.map(|o| o.id),
        }
    }

    /// Look up an area without creating it.
    pub async fn find_area(&self, name: &str) -> AppResult<Option<area::Model>> {
        self.pool.find_area_by_name(&normalize_area_name(name)).await
    }

    pub async fn resolve_area(&self, name: &str) -> AppResult<area::Model> {
        let name = normalize_area_name(name);
        if name.is_empty() {
            return Err(AppError::InvalidInput("Area name is required".to_string()));
        }
        if let Some(allowed) = &self.allowed_areas {
            if !allowed.contains(&name) {
                return Err(AppError::InvalidInput(format!(
                    "Area '{}' is not one of: {}",
                    name,
                    allowed.join(", ")
                )));
            }
        }

        if let Some(existing) = self.pool.find_area_by_name(&name).await? {
            return Ok(existing);
        }

        match self.pool.insert_area(&name).await {
            Ok(created) => {
                info!(area = %created.name, id = %created.id, "Area created");
                Ok(created)
            }
            Err(insert_err) => {
                debug!(area = %name, "Area insert failed, re-reading");
                self.pool
                    .find_area_by_name(&name)
                    .await?
                    .ok_or(insert_err)
            }
        }
    }

    pub async fn resolve_machine(
        &self,
        name: &str,
        machine_no: &str,
        area_id: Uuid,
    ) -> AppResult<machine::Model> {
        let name = name.trim();
        let machine_no = machine_no.trim();
        if name.is_empty() || machine_no.is_empty() {
            return Err(AppError::InvalidInput(
                "Machine name and number are required".to_string(),
            ));
        }

        if let Some(existing) = self.pool.find_machine(name, machine_no, area_id).await? {
            return Ok(existing);
        }

        match self.pool.insert_machine(name, machine_no, area_id).await {
            Ok(created) => {
                info!(
                    machine = %created.name,
                    machine_no = %created.machine_no,
                    id = %created.id,
                    "Machine created"
                );
                Ok(created)
            }
            Err(insert_err) => {
                debug!(machine_no = %machine_no, "Machine insert failed, re-reading");
                if let Some(winner) = self.pool.find_machine(name, machine_no, area_id).await? {
                    return Ok(winner);
                }
                if self.pool.find_machine_by_no(machine_no).await?.is_some() {
                    return Err(AppError::InvalidInput(format!(
                        "Machine number '{}' is already registered to a different machine or area",
                        machine_no
                    )));
                }
                Err(insert_err)
            }
        }
    }

    /// `description` is only used when the OEM is created.
    pub async fn resolve_oem(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<oem::Model> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput("OEM name is required".to_string()));
        }

        if let Some(existing) = self.pool.find_oem_by_name(name).await? {
            return Ok(existing);
        }

        match self.pool.insert_oem(name, description).await {
            Ok(created) => {
                info!(oem = %created.name, id = %created.id, "OEM created");
                Ok(created)
            }
            Err(insert_err) => {
                debug!(oem = %name, "OEM insert failed, re-reading");
                self.pool.find_oem_by_name(name).await?.ok_or(insert_err)
            }
        }
    }
}

//! Ownership propagation for device-generated records.
//!
//! Every record a device produces (sensor logs, irrigation logs, alerts,
//! trigger inputs) is readable only by the device's owner. Instead of each
//! handler copying the owner reference by hand, all child writes go through
//! [`insert_owned`], which stamps `owner_id` from the device row in one place.
//! A handler that bypasses this function is a bug.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    Set,
};
use uuid::Uuid;

use crate::entity::{ai_inputs, alerts, devices, irrigation_logs, sensor_logs};

/// A record whose visibility is scoped to the owning device's user.
pub trait OwnedRecord {
    fn set_owner(&mut self, owner: Option<Uuid>);
}

impl OwnedRecord for sensor_logs::ActiveModel {
    fn set_owner(&mut self, owner: Option<Uuid>) {
        self.owner_id = Set(owner);
    }
}

impl OwnedRecord for irrigation_logs::ActiveModel {
    fn set_owner(&mut self, owner: Option<Uuid>) {
        self.owner_id = Set(owner);
    }
}

impl OwnedRecord for alerts::ActiveModel {
    fn set_owner(&mut self, owner: Option<Uuid>) {
        self.owner_id = Set(owner);
    }
}

impl OwnedRecord for ai_inputs::ActiveModel {
    fn set_owner(&mut self, owner: Option<Uuid>) {
        self.owner_id = Set(owner);
    }
}

/// Insert a device-generated record with the owner scope applied.
///
/// # Errors
///
/// Returns the underlying database error on insert failure.
pub async fn insert_owned<'a, A>(
    db: &'a DatabaseConnection,
    device: &devices::Model,
    mut record: A,
) -> Result<<A::Entity as EntityTrait>::Model, DbErr>
where
    A: ActiveModelTrait + ActiveModelBehavior + OwnedRecord + Send + 'a,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    record.set_owner(device.owner_id);
    record.insert(db).await
}

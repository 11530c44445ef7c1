use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== USERS ==========
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string_len(256))
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== SESSIONS ==========
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Sessions::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Sessions::Token)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Sessions::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_user")
                            .from(Sessions::Table, Sessions::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_user")
                    .table(Sessions::Table)
                    .col(Sessions::UserId)
                    .to_owned(),
            )
            .await?;

        // ========== DEVICES ==========
        manager
            .create_table(
                Table::create()
                    .table(Devices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Devices::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(
                        ColumnDef::new(Devices::HardwareId)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Devices::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Devices::ApiKey).string_len(64).not_null())
                    .col(ColumnDef::new(Devices::OwnerId).uuid())
                    .col(
                        ColumnDef::new(Devices::Status)
                            .string_len(16)
                            .not_null()
                            .default("offline"),
                    )
                    .col(ColumnDef::new(Devices::LastSeen).timestamp_with_time_zone())
                    .col(ColumnDef::new(Devices::Config).json_binary())
                    .col(ColumnDef::new(Devices::Stats).json_binary())
                    .col(
                        ColumnDef::new(Devices::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .col(
                        ColumnDef::new(Devices::UpdatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_devices_owner")
                            .from(Devices::Table, Devices::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_devices_owner")
                    .table(Devices::Table)
                    .col(Devices::OwnerId)
                    .to_owned(),
            )
            .await?;

        // ========== SENSOR LOGS ==========
        manager
            .create_table(
                Table::create()
                    .table(SensorLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SensorLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(SensorLogs::DeviceId).uuid().not_null())
                    .col(ColumnDef::new(SensorLogs::OwnerId).uuid())
                    .col(
                        ColumnDef::new(SensorLogs::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SensorLogs::SoilMoisture).double())
                    .col(ColumnDef::new(SensorLogs::Temperature).double())
                    .col(ColumnDef::new(SensorLogs::Humidity).double())
                    .col(ColumnDef::new(SensorLogs::WaterFlow).double())
                    .col(ColumnDef::new(SensorLogs::WaterPressure).double())
                    .col(ColumnDef::new(SensorLogs::BatteryVoltage).double())
                    .col(ColumnDef::new(SensorLogs::SolarVoltage).double())
                    .col(
                        ColumnDef::new(SensorLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sensor_logs_device")
                            .from(SensorLogs::Table, SensorLogs::DeviceId)
                            .to(Devices::Table, Devices::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sensor_logs_device_time")
                    .table(SensorLogs::Table)
                    .col(SensorLogs::DeviceId)
                    .col(SensorLogs::RecordedAt)
                    .to_owned(),
            )
            .await?;

        // ========== IRRIGATION LOGS ==========
        manager
            .create_table(
                Table::create()
                    .table(IrrigationLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IrrigationLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(IrrigationLogs::DeviceId).uuid().not_null())
                    .col(ColumnDef::new(IrrigationLogs::OwnerId).uuid())
                    .col(
                        ColumnDef::new(IrrigationLogs::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IrrigationLogs::ZoneId).integer())
                    .col(
                        ColumnDef::new(IrrigationLogs::Action)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(IrrigationLogs::DurationSec).integer())
                    .col(ColumnDef::new(IrrigationLogs::WaterUsed).double())
                    .col(ColumnDef::new(IrrigationLogs::TriggerSource).string_len(32))
                    .col(
                        ColumnDef::new(IrrigationLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_irrigation_logs_device")
                            .from(IrrigationLogs::Table, IrrigationLogs::DeviceId)
                            .to(Devices::Table, Devices::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_irrigation_logs_device_time")
                    .table(IrrigationLogs::Table)
                    .col(IrrigationLogs::DeviceId)
                    .col(IrrigationLogs::RecordedAt)
                    .to_owned(),
            )
            .await?;

        // ========== ALERTS ==========
        manager
            .create_table(
                Table::create()
                    .table(Alerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alerts::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Alerts::DeviceId).uuid().not_null())
                    .col(ColumnDef::new(Alerts::OwnerId).uuid())
                    .col(
                        ColumnDef::new(Alerts::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alerts::AlertType).string_len(64).not_null())
                    .col(ColumnDef::new(Alerts::Severity).string_len(16).not_null())
                    .col(ColumnDef::new(Alerts::Message).text().not_null())
                    .col(ColumnDef::new(Alerts::Details).json_binary())
                    .col(
                        ColumnDef::new(Alerts::Resolved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Alerts::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alerts_device")
                            .from(Alerts::Table, Alerts::DeviceId)
                            .to(Devices::Table, Devices::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_alerts_device_resolved")
                    .table(Alerts::Table)
                    .col(Alerts::DeviceId)
                    .col(Alerts::Resolved)
                    .to_owned(),
            )
            .await?;

        // ========== AI INPUTS ==========
        manager
            .create_table(
                Table::create()
                    .table(AiInputs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AiInputs::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(AiInputs::DeviceId).uuid().not_null())
                    .col(ColumnDef::new(AiInputs::OwnerId).uuid())
                    .col(
                        ColumnDef::new(AiInputs::TriggerReason)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AiInputs::Sensors).json_binary())
                    .col(
                        ColumnDef::new(AiInputs::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AiInputs::Processed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(AiInputs::Recommendation).string_len(32))
                    .col(ColumnDef::new(AiInputs::ProcessedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(AiInputs::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ai_inputs_device")
                            .from(AiInputs::Table, AiInputs::DeviceId)
                            .to(Devices::Table, Devices::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Partial index keeps the pending-queue scan cheap
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX idx_ai_inputs_pending ON ai_inputs (recorded_at) WHERE processed = FALSE",
            )
            .await?;

        // ========== NOTIFICATIONS ==========
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Notifications::UserId).uuid().not_null())
                    .col(ColumnDef::new(Notifications::DeviceId).uuid().not_null())
                    .col(
                        ColumnDef::new(Notifications::Kind)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(ColumnDef::new(Notifications::Severity).string_len(16))
                    .col(
                        ColumnDef::new(Notifications::Read)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_user")
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_device")
                            .from(Notifications::Table, Notifications::DeviceId)
                            .to(Devices::Table, Devices::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_user_read")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .col(Notifications::Read)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AiInputs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Alerts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IrrigationLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SensorLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Devices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    CreatedAt,
}

#[derive(Iden)]
enum Sessions {
    Table,
    Id,
    UserId,
    Token,
    ExpiresAt,
    CreatedAt,
}

#[derive(Iden)]
enum Devices {
    Table,
    Id,
    HardwareId,
    Name,
    ApiKey,
    OwnerId,
    Status,
    LastSeen,
    Config,
    Stats,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SensorLogs {
    Table,
    Id,
    DeviceId,
    OwnerId,
    RecordedAt,
    SoilMoisture,
    Temperature,
    Humidity,
    WaterFlow,
    WaterPressure,
    BatteryVoltage,
    SolarVoltage,
    CreatedAt,
}

#[derive(Iden)]
enum IrrigationLogs {
    Table,
    Id,
    DeviceId,
    OwnerId,
    RecordedAt,
    ZoneId,
    Action,
    DurationSec,
    WaterUsed,
    TriggerSource,
    CreatedAt,
}

#[derive(Iden)]
enum Alerts {
    Table,
    Id,
    DeviceId,
    OwnerId,
    RecordedAt,
    AlertType,
    Severity,
    Message,
    Details,
    Resolved,
    CreatedAt,
}

#[derive(Iden)]
enum AiInputs {
    Table,
    Id,
    DeviceId,
    OwnerId,
    TriggerReason,
    Sensors,
    RecordedAt,
    Processed,
    Recommendation,
    ProcessedAt,
    CreatedAt,
}

#[derive(Iden)]
enum Notifications {
    Table,
    Id,
    UserId,
    DeviceId,
    Kind,
    Title,
    Message,
    Severity,
    Read,
    CreatedAt,
}

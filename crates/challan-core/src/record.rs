use serde::{Deserialize, Serialize};

/// One synthetic traffic-violation record.
///
/// Field order is the canonical column order for JSON and CSV output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    /// 8 lowercase hex characters.
    pub id: String,
    pub timestamp: String,
    pub vehicle_plate: String,
    pub violation_code: u16,
    /// Copy of the catalogue description for `violation_code`.
    pub violation_text: String,
    /// Single uppercase letter placeholder.
    pub offender_name: String,
    pub challan_amount: u32,
    /// Never exceeds `challan_amount`.
    pub credits_amount: u32,
    /// Path of the rendered photo or stub; live mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_reference: Option<String>,
}

impl ViolationRecord {
    /// Attaches the artifact path produced for this record.
    pub fn with_photo(mut self, reference: impl Into<String>) -> Self {
        self.photo_reference = Some(reference.into());
        self
    }
}

/// A CSV column of [`ViolationRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordColumn {
    Id,
    Timestamp,
    VehiclePlate,
    ViolationCode,
    ViolationText,
    OffenderName,
    ChallanAmount,
    CreditsAmount,
    PhotoReference,
}

/// Snapshot columns: every field except the photo reference.
pub const BATCH_COLUMNS: [RecordColumn; 8] = [
    RecordColumn::Id,
    RecordColumn::Timestamp,
    RecordColumn::VehiclePlate,
    RecordColumn::ViolationCode,
    RecordColumn::ViolationText,
    RecordColumn::OffenderName,
    RecordColumn::ChallanAmount,
    RecordColumn::CreditsAmount,
];

/// Append-log columns, fixed across process restarts.
pub const LIVE_COLUMNS: [RecordColumn; 9] = [
    RecordColumn::Id,
    RecordColumn::Timestamp,
    RecordColumn::VehiclePlate,
    RecordColumn::ViolationCode,
    RecordColumn::ViolationText,
    RecordColumn::OffenderName,
    RecordColumn::ChallanAmount,
    RecordColumn::CreditsAmount,
    RecordColumn::PhotoReference,
];

impl RecordColumn {
    pub fn name(&self) -> &'static str {
        match self {
            RecordColumn::Id => "id",
            RecordColumn::Timestamp => "timestamp",
            RecordColumn::VehiclePlate => "vehicle_plate",
            RecordColumn::ViolationCode => "violation_code",
            RecordColumn::ViolationText => "violation_text",
            RecordColumn::OffenderName => "offender_name",
            RecordColumn::ChallanAmount => "challan_amount",
            RecordColumn::CreditsAmount => "credits_amount",
            RecordColumn::PhotoReference => "photo_reference",
        }
    }

    /// Renders the column value of `record` as a CSV field.
    pub fn field(&self, record: &ViolationRecord) -> String {
        match self {
            RecordColumn::Id => record.id.clone(),
            RecordColumn::Timestamp => record.timestamp.clone(),
            RecordColumn::VehiclePlate => record.vehicle_plate.clone(),
            RecordColumn::ViolationCode => record.violation_code.to_string(),
            RecordColumn::ViolationText => record.violation_text.clone(),
            RecordColumn::OffenderName => record.offender_name.clone(),
            RecordColumn::ChallanAmount => record.challan_amount.to_string(),
            RecordColumn::CreditsAmount => record.credits_amount.to_string(),
            RecordColumn::PhotoReference => record.photo_reference.clone().unwrap_or_default(),
        }
    }
}

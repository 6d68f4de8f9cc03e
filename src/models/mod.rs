//! Domain models for the parts inventory API.

pub mod area;
pub mod dashboard;
pub mod machine;
pub mod oem;
pub mod part;
pub mod progress;
pub mod upload;
pub mod user;

// Re-export commonly used types
pub use area::{Area, CreateAreaRequest};
pub use dashboard::{
    AreaMachineCount, AreaOems, DashboardSummary, MachinePartEntry, MachineParts, OemQuantity,
    PartQuantity,
};
pub use machine::{CreateMachineRequest, Machine};
pub use oem::{CreateOemRequest, Oem};
pub use part::{CreatePartRequest, Part, PartCreatedResponse, PartDetail};
pub use progress::{ProgressEvent, ProgressStatus};
pub use upload::{
    ProgressQuery, RawRow, RowErrorReport, UploadQuery, UploadResponse, UploadSummary, ValidatedRow,
};
pub use user::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, Role, SessionClaims, User,
    UserResponse,
};

/// Plain `{ "message": ... }` response body.
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

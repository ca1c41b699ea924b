//! API payload types
//!
//! Request and response shapes for the resource façades. Unknown fields
//! are kept in `extra` maps where the platform is known to add fields
//! without notice.

pub mod content;
pub mod device;
pub mod family;
pub mod media;

pub use content::{Card, CardContent, CardMetadata, CardResponse, Chapter, ContentList, Track};
pub use device::{Device, DeviceConfig, DeviceList, DeviceSettings, DeviceStatus};
pub use family::{FamilyGroup, FamilyGroupItem, FamilyImage, FamilyImageList, FamilyImageUpload};
pub use media::{CoverImage, CoverImageUpload, TranscodeUpload, TranscodeUploadUrl, TranscodedAudio};

pub mod bulletin;
pub mod full_report;

pub use bulletin::{
    Bulletin, BulletinData, CountyBulletin, CountyKey, ImportedUndefinedBulletin, ReportRow,
    StateTotalBulletin,
};
pub use full_report::FullReport;

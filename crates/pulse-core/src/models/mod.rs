pub mod category;
pub mod daily;
pub mod note;
pub mod risk_score;
pub mod subject;

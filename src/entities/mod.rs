pub mod ai_analysis;
pub mod company;
pub mod company_update;
pub mod metric;
pub mod report;

pub use company::InvestorList;

pub use ai_analysis::Entity as AiAnalysis;
pub use company::Entity as Company;
pub use company_update::Entity as CompanyUpdate;
pub use metric::Entity as Metric;
pub use report::Entity as Report;

//! Data source implementations

pub mod data_source_dataset;
pub mod data_source_project;
pub mod data_source_prompt;
pub mod data_source_prompt_commit;
pub mod data_source_tag_key;
pub mod data_source_workspace;

pub use data_source_dataset::DatasetDataSource;
pub use data_source_project::ProjectDataSource;
pub use data_source_prompt::PromptDataSource;
pub use data_source_prompt_commit::PromptCommitDataSource;
pub use data_source_tag_key::TagKeyDataSource;
pub use data_source_workspace::WorkspaceDataSource;

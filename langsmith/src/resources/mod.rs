//! Resource implementations

pub mod resource_alert_rule;
pub mod resource_annotation_queue;
pub mod resource_bulk_export;
pub mod resource_bulk_export_destination;
pub mod resource_dataset;
pub mod resource_example;
pub mod resource_feedback_config;
pub mod resource_model_price;
pub mod resource_org_role;
pub mod resource_playground_settings;
pub mod resource_project;
pub mod resource_prompt;
pub mod resource_prompt_commit;
pub mod resource_run_rule;
pub mod resource_secret;
pub mod resource_service_account;
pub mod resource_service_key;
pub mod resource_sso_settings;
pub mod resource_tag_key;
pub mod resource_tag_value;
pub mod resource_ttl_settings;
pub mod resource_usage_limit;
pub mod resource_webhook;
pub mod resource_workspace;

pub use resource_alert_rule::AlertRuleResource;
pub use resource_annotation_queue::AnnotationQueueResource;
pub use resource_bulk_export::BulkExportResource;
pub use resource_bulk_export_destination::BulkExportDestinationResource;
pub use resource_dataset::DatasetResource;
pub use resource_example::ExampleResource;
pub use resource_feedback_config::FeedbackConfigResource;
pub use resource_model_price::ModelPriceResource;
pub use resource_org_role::OrgRoleResource;
pub use resource_playground_settings::PlaygroundSettingsResource;
pub use resource_project::ProjectResource;
pub use resource_prompt::PromptResource;
pub use resource_prompt_commit::PromptCommitResource;
pub use resource_run_rule::RunRuleResource;
pub use resource_secret::SecretResource;
pub use resource_service_account::ServiceAccountResource;
pub use resource_service_key::ServiceKeyResource;
pub use resource_sso_settings::SsoSettingsResource;
pub use resource_tag_key::TagKeyResource;
pub use resource_tag_value::TagValueResource;
pub use resource_ttl_settings::TtlSettingsResource;
pub use resource_usage_limit::UsageLimitResource;
pub use resource_webhook::WebhookResource;
pub use resource_workspace::WorkspaceResource;

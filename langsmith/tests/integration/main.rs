//! Resource lifecycles driven through the provider harness against a mock API

mod support;

mod access_test;
mod annotation_queue_test;
mod automation_test;
mod example_test;
mod pricing_test;
mod project_test;
mod prompt_test;
mod secret_test;
mod settings_test;
mod tag_test;

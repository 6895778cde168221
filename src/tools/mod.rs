pub mod binder;
pub mod descriptor;
pub mod merge;
pub mod registry;
pub mod resolver;
pub mod templates;

pub use binder::{ClientContext, ClientScopedBinder, ToolBinder, CLIENT_ID_HEADER};
pub use descriptor::{ParameterSchema, ToolDescriptor, ToolDescriptorBuilder};
pub use merge::merge;
pub use registry::ToolSet;
pub use resolver::ToolResolver;
pub use templates::provider_templates;

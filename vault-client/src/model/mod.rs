mod app_info;
mod lock_policy;
mod route;

pub use app_info::AppInfo;
pub use lock_policy::LockPolicy;
pub use route::RouteDescriptor;

mod route;
pub use route::Route;

mod spinner;
pub use spinner::Spinner;

pub mod events;

pub mod snackbar;

mod modal;
pub use modal::Modal;

mod sidebar;
pub use sidebar::Sidebar;

mod notification_list;
pub use notification_list::NotificationList;

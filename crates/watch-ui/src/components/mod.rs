pub mod header;
pub mod progress_bar;
pub mod report_list;
pub mod toast;

pub use header::Header;
pub use progress_bar::{CycleProgressBar, OverallProgressBar};
pub use report_list::ReportList;
pub use toast::{ToastKind, Toasts};

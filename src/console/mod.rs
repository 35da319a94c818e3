pub mod clipboard;
pub mod event;
pub mod form;
pub mod list;
pub mod render;
pub mod result;
pub mod shell;
pub mod timer;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, Osc52Clipboard};
pub use event::{ConsoleEvent, EventReceiver, EventSender};
pub use form::{FormError, FormField, TenantForm, SUCCESS_BANNER_DURATION};
pub use list::{DeleteConfirmation, ListDisplay, ListError, ListPhase, RefreshTicket, TenantListView};
pub use result::{CopyField, TenantResultView, COPY_ACK_DURATION};
pub use shell::{BackendStatus, OfflineBanner, Shell};
pub use timer::DelayedAction;

pub use crate::context::{Context, Providers, create_context};
pub use crate::effects::{Dispose, effect, on_unmount};
pub use crate::error::ContextError;
pub use crate::reactive::{Observer, observe, untracked};
pub use crate::scope::{Scope, current_scope, scoped_effect};
pub use crate::signal::{Signal, signal};

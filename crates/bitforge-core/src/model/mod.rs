// ── Domain model ──
//
// Descriptors (caller-supplied desired state) and the identifier codec.

pub mod descriptor;
pub mod identifier;

pub use descriptor::{Descriptor, ID_FIELD};
pub use identifier::IdScheme;

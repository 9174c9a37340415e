pub mod category;
pub mod profile;
pub mod settings;
pub mod transaction;

pub use category::{Category, CategoryInfo};
pub use profile::UserProfile;
pub use settings::Settings;
pub use transaction::{
    validate_input, Transaction, TransactionId, TransactionInput, TransactionType,
};

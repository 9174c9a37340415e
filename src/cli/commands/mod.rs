pub mod report;
pub mod settings;
pub mod system;
pub mod transaction;

use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in transaction::definitions()
        .into_iter()
        .chain(report::definitions())
        .chain(settings::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}

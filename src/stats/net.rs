use std::collections::HashMap;

use super::raw::NetworkStats;
use super::{DataQualityWarning, NetworkSelection};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(super) struct Network {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

impl std::ops::AddAssign<&NetworkStats> for Network {
    fn add_assign(&mut self, rhs: &NetworkStats) {
        self.rx_bytes = self.rx_bytes.saturating_add(rhs.rx_bytes);
        self.tx_bytes = self.tx_bytes.saturating_add(rhs.tx_bytes);
    }
}

/// Sums or selects interface counters according to `selection`.
///
/// A selected interface that is not part of the snapshot reports zero bytes.
pub(super) fn derive(
    interfaces: &HashMap<String, NetworkStats>,
    selection: &NetworkSelection,
    warnings: &mut Vec<DataQualityWarning>,
) -> Network {
    let mut network = Network::default();
    match selection {
        NetworkSelection::AllInterfaces => {
            for stats in interfaces.values() {
                network += stats;
            }
        }
        NetworkSelection::Interface(name) => match interfaces.get(name) {
            Some(stats) => network += stats,
            None => warnings.push(DataQualityWarning::MissingNetworkInterface(name.clone())),
        },
    }
    network
}

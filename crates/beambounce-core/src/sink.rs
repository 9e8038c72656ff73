//! Collaborator sinks the simulation reports into.
//!
//! The host owns enemy health and connector feedback. The simulation only
//! tells it when to apply damage and when a beam starts or stops touching
//! a connector.

use crate::id::EntityId;

/// Receives damage pulses. The target tracks its own health and death.
pub trait DamageSink {
    fn apply_damage(&mut self, target: EntityId, amount: u32);
}

/// Receives edge-triggered connector contact notifications: `on_hit` once
/// when a beam starts touching a connector, `on_idle` once when it stops.
pub trait ConnectorSink {
    fn on_hit(&mut self, connector: EntityId);
    fn on_idle(&mut self, connector: EntityId);
}

/// Borrows a separate damage sink and connector sink as one value, for
/// hosts that keep the two apart.
pub struct SinkPair<'a, D: ?Sized, C: ?Sized> {
    pub damage: &'a mut D,
    pub connectors: &'a mut C,
}

impl<D: DamageSink + ?Sized, C: ?Sized> DamageSink for SinkPair<'_, D, C> {
    fn apply_damage(&mut self, target: EntityId, amount: u32) {
        self.damage.apply_damage(target, amount);
    }
}

impl<D: ?Sized, C: ConnectorSink + ?Sized> ConnectorSink for SinkPair<'_, D, C> {
    fn on_hit(&mut self, connector: EntityId) {
        self.connectors.on_hit(connector);
    }

    fn on_idle(&mut self, connector: EntityId) {
        self.connectors.on_idle(connector);
    }
}

/// A sink that discards everything. Useful when the host has no enemies or
/// connectors in play.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DamageSink for NullSink {
    fn apply_damage(&mut self, _target: EntityId, _amount: u32) {}
}

impl ConnectorSink for NullSink {
    fn on_hit(&mut self, _connector: EntityId) {}
    fn on_idle(&mut self, _connector: EntityId) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{RecordingSink, SinkCall};

    #[test]
    fn sink_pair_routes_by_concern() {
        let mut damage = RecordingSink::new();
        let mut connectors = RecordingSink::new();
        let mut pair = SinkPair {
            damage: &mut damage,
            connectors: &mut connectors,
        };
        pair.apply_damage(EntityId(1), 4);
        pair.on_hit(EntityId(2));
        pair.on_idle(EntityId(2));

        assert_eq!(damage.calls, vec![SinkCall::Damage { target: EntityId(1), amount: 4 }]);
        assert_eq!(connectors.hits(EntityId(2)), 1);
        assert_eq!(connectors.idles(EntityId(2)), 1);
    }
}

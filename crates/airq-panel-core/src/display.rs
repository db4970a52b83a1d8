//! Display collaborator traits.

use crate::Channel;

/// Gauge and label surface of the panel.
///
/// Updates made between two `commit` calls belong to one refresh tick and
/// must not become visible before the commit.
pub trait DisplaySurface {
    /// Moves the channel's gauge needle.
    fn set_gauge_value(&mut self, channel: Channel, value: i32);

    /// Replaces the channel's label text.
    fn set_label_text(&mut self, channel: Channel, text: &str);

    /// Flags or clears a dangerous reading on the channel's gauge.
    fn set_critical(&mut self, _channel: Channel, _critical: bool) {}

    /// Publishes all updates staged since the previous commit.
    fn commit(&mut self) {}
}

/// Keeps the surrounding render loop from idling.
pub trait ActivitySignal {
    /// Records that the panel was refreshed.
    fn notify_activity(&self);
}

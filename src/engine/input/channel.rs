// Channels: device-independent input signals and their combinators
//
// A channel is one logical signal (a key, a stick axis, two keys acting as an
// axis...). Device sources hand out shared channels, and combinators wrap
// other shared channels, so an action binding can be built from any mix.

use super::config::BoundInput;
use super::event::InputEvent;
use std::fmt;
use std::ops::BitOr;
use std::rc::Rc;

/// Readings with a magnitude at or below this are treated as zero
pub const DEAD_ZONE: f32 = 0.001;

/// Selects which device classes `Channel::desc` should describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceMask(u8);

impl DeviceMask {
    pub const KEYBOARD: Self = Self(1);
    pub const MOUSE: Self = Self(2);
    pub const GAMEPAD: Self = Self(4);
    pub const ALL: Self = Self(1 | 2 | 4);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for DeviceMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// One logical input signal
///
/// Values are in [-1, 1] for axis-like channels and exactly 0 or 1 for
/// button-like ones. Device channels read the snapshot taken by their source's
/// last `update`, so every query within a frame sees the same state.
pub trait Channel: fmt::Debug {
    fn is_on(&self) -> bool;

    /// Whether some part of the channel is on even if the whole is not
    fn is_partially_on(&self) -> bool {
        self.is_on()
    }

    /// True only if this frame's event batch moved the channel away from neutral
    fn matches_frame_events(&self) -> bool;

    fn value(&self) -> f32;

    /// Treat the current device reading as the rest position from now on
    fn set_neutral(&self) {}

    fn is_null(&self) -> bool {
        false
    }

    /// Human-readable description, empty if none of the masked devices are involved
    fn desc(&self, mask: DeviceMask) -> String;

    /// The serialized binding that would recreate this channel, for device channels
    fn bound_input(&self) -> Option<BoundInput> {
        None
    }
}

/// Channels are shared between their source and any bindings using them
pub type SharedChannel = Rc<dyn Channel>;

/// A device that owns and updates a set of channels
pub trait ChannelSource {
    /// Re-read device state from this frame's events
    fn update(&mut self, events: &[InputEvent]);

    /// Every channel this source has created so far
    fn channels(&self) -> Vec<SharedChannel>;

    fn set_neutral(&self) {
        for channel in self.channels() {
            channel.set_neutral();
        }
    }
}

fn on_value(on: bool) -> f32 {
    if on {
        1.0
    } else {
        0.0
    }
}

/// Always-off channel used wherever no binding could be resolved
#[derive(Debug, Default)]
pub struct NullChannel;

impl Channel for NullChannel {
    fn is_on(&self) -> bool {
        false
    }

    fn matches_frame_events(&self) -> bool {
        false
    }

    fn value(&self) -> f32 {
        0.0
    }

    fn is_null(&self) -> bool {
        true
    }

    fn desc(&self, _mask: DeviceMask) -> String {
        "None".to_string()
    }
}

/// Negates the value of an axis channel
#[derive(Debug)]
pub struct InvertAxisChannel {
    channel: SharedChannel,
}

impl InvertAxisChannel {
    pub fn new(channel: SharedChannel) -> Self {
        Self { channel }
    }
}

impl Channel for InvertAxisChannel {
    fn is_on(&self) -> bool {
        self.channel.is_on()
    }

    fn matches_frame_events(&self) -> bool {
        self.channel.matches_frame_events()
    }

    fn value(&self) -> f32 {
        -self.channel.value()
    }

    fn set_neutral(&self) {
        self.channel.set_neutral();
    }

    fn desc(&self, mask: DeviceMask) -> String {
        let inner = self.channel.desc(mask);
        if inner.is_empty() {
            inner
        } else {
            format!("-{}", inner)
        }
    }
}

/// Combines a negative and a positive channel into one signed axis
///
/// When both sides are on, the negative side wins.
#[derive(Debug)]
pub struct PseudoAxisChannel {
    neg: SharedChannel,
    pos: SharedChannel,
    neg_invert: bool,
    pos_invert: bool,
}

impl PseudoAxisChannel {
    pub fn new(neg: SharedChannel, pos: SharedChannel, neg_invert: bool, pos_invert: bool) -> Self {
        Self {
            neg,
            pos,
            neg_invert,
            pos_invert,
        }
    }
}

impl Channel for PseudoAxisChannel {
    fn is_on(&self) -> bool {
        self.neg.is_on() || self.pos.is_on()
    }

    fn matches_frame_events(&self) -> bool {
        self.neg.matches_frame_events() || self.pos.matches_frame_events()
    }

    fn value(&self) -> f32 {
        if self.neg.is_on() {
            let v = -self.neg.value().abs();
            if self.neg_invert {
                -v
            } else {
                v
            }
        } else if self.pos.is_on() {
            let v = self.pos.value().abs();
            if self.pos_invert {
                -v
            } else {
                v
            }
        } else {
            0.0
        }
    }

    fn set_neutral(&self) {
        self.neg.set_neutral();
        self.pos.set_neutral();
    }

    fn desc(&self, mask: DeviceMask) -> String {
        let neg = self.neg.desc(mask);
        let pos = self.pos.desc(mask);
        match (neg.is_empty(), pos.is_empty()) {
            (true, true) => String::new(),
            (false, true) => neg,
            (true, false) => pos,
            (false, false) => format!("{} / {}", neg, pos),
        }
    }
}

/// Turns an analog axis into a digital button
#[derive(Debug)]
pub struct PseudoButtonChannel {
    channel: SharedChannel,
}

impl PseudoButtonChannel {
    pub fn new(channel: SharedChannel) -> Self {
        Self { channel }
    }
}

impl Channel for PseudoButtonChannel {
    fn is_on(&self) -> bool {
        self.channel.value().abs() > DEAD_ZONE
    }

    fn matches_frame_events(&self) -> bool {
        self.channel.matches_frame_events()
    }

    fn value(&self) -> f32 {
        on_value(self.is_on())
    }

    fn set_neutral(&self) {
        self.channel.set_neutral();
    }

    fn desc(&self, mask: DeviceMask) -> String {
        self.channel.desc(mask)
    }
}

fn join_descs(channels: &[SharedChannel], mask: DeviceMask, separator: &str) -> String {
    channels
        .iter()
        .map(|ch| ch.desc(mask))
        .filter(|desc| !desc.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// On when any of its channels is on
///
/// An empty `MultiOrChannel` is never on.
#[derive(Debug, Default)]
pub struct MultiOrChannel {
    channels: Vec<SharedChannel>,
}

impl MultiOrChannel {
    pub fn new(channels: Vec<SharedChannel>) -> Self {
        Self { channels }
    }

    pub fn add_channel(&mut self, channel: SharedChannel) {
        self.channels.push(channel);
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl Channel for MultiOrChannel {
    fn is_on(&self) -> bool {
        self.channels.iter().any(|ch| ch.is_on())
    }

    fn is_partially_on(&self) -> bool {
        self.channels.iter().any(|ch| ch.is_partially_on())
    }

    fn matches_frame_events(&self) -> bool {
        self.channels.iter().any(|ch| ch.matches_frame_events())
    }

    fn value(&self) -> f32 {
        self.channels
            .iter()
            .find(|ch| ch.is_on())
            .map(|ch| ch.value())
            .unwrap_or(0.0)
    }

    fn set_neutral(&self) {
        for channel in &self.channels {
            channel.set_neutral();
        }
    }

    fn desc(&self, mask: DeviceMask) -> String {
        join_descs(&self.channels, mask, " or ")
    }
}

/// On only when all of its channels are on (key chords)
///
/// An empty `MultiAndChannel` is never on.
#[derive(Debug, Default)]
pub struct MultiAndChannel {
    channels: Vec<SharedChannel>,
}

impl MultiAndChannel {
    pub fn new(channels: Vec<SharedChannel>) -> Self {
        Self { channels }
    }

    pub fn add_channel(&mut self, channel: SharedChannel) {
        self.channels.push(channel);
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl Channel for MultiAndChannel {
    fn is_on(&self) -> bool {
        !self.channels.is_empty() && self.channels.iter().all(|ch| ch.is_on())
    }

    fn is_partially_on(&self) -> bool {
        let on = self.channels.iter().filter(|ch| ch.is_on()).count();
        on > 0 && on < self.channels.len()
    }

    fn matches_frame_events(&self) -> bool {
        !self.channels.is_empty() && self.channels.iter().all(|ch| ch.matches_frame_events())
    }

    /// The sub-value with the smallest magnitude
    fn value(&self) -> f32 {
        self.channels
            .iter()
            .map(|ch| ch.value())
            .min_by(|a, b| a.abs().total_cmp(&b.abs()))
            .unwrap_or(0.0)
    }

    fn set_neutral(&self) {
        for channel in &self.channels {
            channel.set_neutral();
        }
    }

    fn desc(&self, mask: DeviceMask) -> String {
        join_descs(&self.channels, mask, " + ")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::Cell;

    /// Hand-driven channel for exercising combinators
    #[derive(Debug, Default)]
    pub(crate) struct FakeChannel {
        pub on: Cell<bool>,
        pub value: Cell<f32>,
        pub matched: Cell<bool>,
        pub neutral_calls: Cell<u32>,
    }

    impl FakeChannel {
        pub fn button(on: bool) -> Rc<Self> {
            let ch = Rc::new(Self::default());
            ch.press(on);
            ch
        }

        pub fn axis(value: f32) -> Rc<Self> {
            let ch = Rc::new(Self::default());
            ch.value.set(value);
            ch.on.set(value.abs() > DEAD_ZONE);
            ch
        }

        pub fn press(&self, on: bool) {
            self.on.set(on);
            self.value.set(on_value(on));
        }
    }

    impl Channel for FakeChannel {
        fn is_on(&self) -> bool {
            self.on.get()
        }

        fn matches_frame_events(&self) -> bool {
            self.matched.get()
        }

        fn value(&self) -> f32 {
            self.value.get()
        }

        fn set_neutral(&self) {
            self.neutral_calls.set(self.neutral_calls.get() + 1);
        }

        fn desc(&self, mask: DeviceMask) -> String {
            if mask.contains(DeviceMask::KEYBOARD) {
                "Fake".to_string()
            } else {
                String::new()
            }
        }
    }

    fn shared(ch: &Rc<FakeChannel>) -> SharedChannel {
        ch.clone()
    }

    #[test]
    fn test_device_mask_contains() {
        assert!(DeviceMask::ALL.contains(DeviceMask::GAMEPAD));
        assert!((DeviceMask::KEYBOARD | DeviceMask::MOUSE).contains(DeviceMask::MOUSE));
        assert!(!DeviceMask::KEYBOARD.contains(DeviceMask::GAMEPAD));
    }

    #[test]
    fn test_null_channel_is_inert() {
        let null = NullChannel;
        for _ in 0..3 {
            assert!(!null.is_on());
            assert!(!null.is_partially_on());
            assert_eq!(null.value(), 0.0);
            assert!(!null.matches_frame_events());
            assert!(null.is_null());
        }
    }

    #[test]
    fn test_invert_negates_value() {
        for reading in [-1.0, -0.4, 0.0, 0.25, 1.0] {
            let inner = FakeChannel::axis(reading);
            let inverted = InvertAxisChannel::new(shared(&inner));
            assert_relative_eq!(inverted.value(), -inner.value());
            assert_eq!(inverted.is_on(), inner.is_on());
        }
    }

    #[test]
    fn test_invert_delegates_neutral_and_events() {
        let inner = FakeChannel::axis(0.5);
        inner.matched.set(true);
        let inverted = InvertAxisChannel::new(shared(&inner));

        assert!(inverted.matches_frame_events());
        inverted.set_neutral();
        assert_eq!(inner.neutral_calls.get(), 1);
        assert_eq!(inverted.desc(DeviceMask::ALL), "-Fake");
    }

    #[test]
    fn test_pseudo_axis_from_buttons() {
        let left = FakeChannel::button(false);
        let right = FakeChannel::button(false);
        let axis = PseudoAxisChannel::new(shared(&left), shared(&right), false, false);

        assert_eq!(axis.value(), 0.0);
        assert!(!axis.is_on());

        left.press(true);
        assert_eq!(axis.value(), -1.0);

        right.press(true);
        assert_eq!(axis.value(), -1.0, "negative side has priority");

        left.press(false);
        assert_eq!(axis.value(), 1.0);
        assert!(axis.is_on());
    }

    #[test]
    fn test_pseudo_axis_side_inversion() {
        let neg = FakeChannel::axis(0.6);
        let pos = FakeChannel::axis(0.0);
        let axis = PseudoAxisChannel::new(shared(&neg), shared(&pos), true, true);
        assert_relative_eq!(axis.value(), 0.6);

        neg.value.set(0.0);
        neg.on.set(false);
        pos.value.set(0.3);
        pos.on.set(true);
        assert_relative_eq!(axis.value(), -0.3);
    }

    #[test]
    fn test_pseudo_axis_uses_magnitude_of_negative_side() {
        // A stick pushed towards its negative end still reads as negative
        let neg = FakeChannel::axis(-0.7);
        let pos = FakeChannel::axis(0.0);
        let axis = PseudoAxisChannel::new(shared(&neg), shared(&pos), false, false);
        assert_relative_eq!(axis.value(), -0.7);
    }

    #[test]
    fn test_pseudo_button_dead_zone() {
        let inner = FakeChannel::axis(0.0005);
        let button = PseudoButtonChannel::new(shared(&inner));
        assert!(!button.is_on());
        assert_eq!(button.value(), 0.0);

        inner.value.set(-0.2);
        assert!(button.is_on());
        assert_eq!(button.value(), 1.0);
    }

    #[test]
    fn test_multi_or() {
        let a = FakeChannel::button(false);
        let b = FakeChannel::axis(0.0);
        let or = MultiOrChannel::new(vec![shared(&a), shared(&b)]);
        assert!(!or.is_on());
        assert_eq!(or.value(), 0.0);

        b.value.set(-0.5);
        b.on.set(true);
        assert!(or.is_on());
        assert_relative_eq!(or.value(), -0.5);

        a.press(true);
        assert_eq!(or.value(), 1.0, "first on channel supplies the value");

        a.matched.set(true);
        assert!(or.matches_frame_events());
        assert_eq!(or.desc(DeviceMask::ALL), "Fake or Fake");
    }

    #[test]
    fn test_multi_and() {
        let a = FakeChannel::button(true);
        let b = FakeChannel::axis(0.0);
        let mut and = MultiAndChannel::new(vec![shared(&a)]);
        and.add_channel(shared(&b));

        assert!(!and.is_on());
        assert!(and.is_partially_on());

        b.value.set(-0.25);
        b.on.set(true);
        assert!(and.is_on());
        assert!(!and.is_partially_on());
        assert_relative_eq!(and.value(), -0.25);

        a.matched.set(true);
        assert!(!and.matches_frame_events());
        b.matched.set(true);
        assert!(and.matches_frame_events());
    }

    #[test]
    fn test_multi_or_partial_even_when_off() {
        let chord = MultiAndChannel::new(vec![
            FakeChannel::button(true) as SharedChannel,
            FakeChannel::button(false) as SharedChannel,
        ]);
        let or = MultiOrChannel::new(vec![Rc::new(chord)]);
        assert!(!or.is_on());
        assert!(or.is_partially_on());
    }

    #[test]
    fn test_empty_multi_channels_are_off() {
        assert!(!MultiAndChannel::default().is_on());
        assert!(!MultiAndChannel::default().matches_frame_events());
        assert!(!MultiOrChannel::default().is_on());
        assert_eq!(MultiAndChannel::default().value(), 0.0);
    }

    #[test]
    fn test_multi_set_neutral_reaches_every_channel() {
        let a = FakeChannel::button(false);
        let b = FakeChannel::button(false);
        let or = MultiOrChannel::new(vec![shared(&a), shared(&b)]);
        or.set_neutral();
        assert_eq!(a.neutral_calls.get(), 1);
        assert_eq!(b.neutral_calls.get(), 1);
    }

    #[test]
    fn test_desc_respects_mask() {
        let a = FakeChannel::button(false);
        let axis = PseudoAxisChannel::new(shared(&a), Rc::new(NullChannel), false, false);
        assert_eq!(axis.desc(DeviceMask::GAMEPAD), "None");
        assert_eq!(
            MultiOrChannel::new(vec![shared(&a)]).desc(DeviceMask::GAMEPAD),
            ""
        );
    }
}

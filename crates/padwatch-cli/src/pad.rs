//! Evdev realization of the input source.
//!
//! Every `/dev/input/event*` device that can emit a mapped control is
//! opened non-blocking; each refresh drains whatever events accumulated
//! since the last tick and folds them into one snapshot. Auto-repeat is
//! synthesized from hold times, since gamepads do not emit kernel repeat
//! events.

use std::collections::{HashMap, HashSet};
use std::io;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use evdev::{AbsoluteAxisType, Device, InputEventKind, Key};
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use padwatch_core::{Button, InputSource};

/// Hold time before the first synthesized repeat.
const REPEAT_DELAY: Duration = Duration::from_millis(300);
/// Spacing of synthesized repeats after the first.
const REPEAT_INTERVAL: Duration = Duration::from_millis(100);

/// The input source backed by the device nodes under `/dev/input`.
pub struct EvdevPad {
    devices: Vec<PadDevice>,
    state: PadState,
}

struct PadDevice {
    path: PathBuf,
    device: Device,
    x: Option<AxisRange>,
    y: Option<AxisRange>,
}

impl EvdevPad {
    /// Open every input device that can emit a mapped control.
    ///
    /// Buttons are often spread over several nodes (the gamepad proper,
    /// a separate power-key device, volume keys on a third), so all
    /// matching devices are polled together.
    pub fn open() -> Result<Self> {
        let mut devices = Vec::new();
        for entry in std::fs::read_dir("/dev/input").context("reading /dev/input")? {
            let entry = entry.context("reading /dev/input")?;
            let path = entry.path();

            if !path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("event"))
                .unwrap_or(false)
            {
                continue;
            }

            match Device::open(&path) {
                Ok(device) => {
                    if !emits_mapped_control(&device) {
                        continue;
                    }
                    match PadDevice::new(path.clone(), device) {
                        Ok(pad_device) => {
                            tracing::debug!(
                                "polling {} ({})",
                                path.display(),
                                pad_device.device.name().unwrap_or("unknown")
                            );
                            devices.push(pad_device);
                        }
                        Err(e) => {
                            tracing::debug!("skipping {}: {}", path.display(), e);
                        }
                    }
                }
                Err(e) => {
                    tracing::debug!("could not open {}: {}", path.display(), e);
                }
            }
        }

        if devices.is_empty() {
            bail!("no usable input devices under /dev/input");
        }

        Ok(Self {
            devices,
            state: PadState::default(),
        })
    }
}

impl InputSource for EvdevPad {
    fn refresh(&mut self) -> io::Result<()> {
        let now = Instant::now();
        self.state.begin();
        for dev in &mut self.devices {
            loop {
                match dev.device.fetch_events() {
                    Ok(events) => {
                        for event in events {
                            match event.kind() {
                                InputEventKind::Key(key) => {
                                    self.state.key_event(key, event.value(), now);
                                }
                                InputEventKind::AbsAxis(axis) => {
                                    self.state.axis_event(axis, event.value(), dev.x, dev.y, now);
                                }
                                _ => {}
                            }
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        tracing::error!("reading {}: {}", dev.path.display(), e);
                        return Err(e);
                    }
                }
            }
        }
        self.state.settle(now);
        Ok(())
    }

    fn just_pressed(&self, button: Button) -> bool {
        self.state.just_pressed(button)
    }

    fn is_pressed(&self, button: Button) -> bool {
        self.state.is_pressed(button)
    }

    fn just_released(&self, button: Button) -> bool {
        self.state.just_released(button)
    }

    fn just_repeated(&self, button: Button) -> bool {
        self.state.just_repeated(button)
    }
}

impl PadDevice {
    fn new(path: PathBuf, device: Device) -> Result<Self> {
        set_nonblocking(&device, &path)?;

        // Analog ranges only matter on the gamepad node itself; ABS_X on
        // anything else (a touchscreen, say) is not a stick.
        let (x, y) = if is_gamepad(&device) {
            stick_ranges(&device)
        } else {
            (None, None)
        };

        Ok(Self {
            path,
            device,
            x,
            y,
        })
    }
}

fn set_nonblocking(device: &Device, path: &Path) -> Result<()> {
    fcntl(device.as_raw_fd(), FcntlArg::F_SETFL(OFlag::O_NONBLOCK))
        .with_context(|| format!("setting {} non-blocking", path.display()))?;
    Ok(())
}

fn is_gamepad(device: &Device) -> bool {
    device
        .supported_keys()
        .map(|keys| {
            keys.contains(Key::BTN_SOUTH)
                || keys.contains(Key::BTN_EAST)
                || keys.contains(Key::BTN_START)
        })
        .unwrap_or(false)
}

/// Whether the device can produce at least one catalog button.
fn emits_mapped_control(device: &Device) -> bool {
    let mapped_key = device
        .supported_keys()
        .map(|keys| keys.iter().any(|key| key_button(key).is_some()))
        .unwrap_or(false);
    if mapped_key {
        return true;
    }

    is_gamepad(device)
        && device
            .supported_absolute_axes()
            .map(|axes| {
                axes.contains(AbsoluteAxisType::ABS_HAT0X)
                    || axes.contains(AbsoluteAxisType::ABS_HAT0Y)
                    || axes.contains(AbsoluteAxisType::ABS_X)
                    || axes.contains(AbsoluteAxisType::ABS_Y)
            })
            .unwrap_or(false)
}

fn stick_ranges(device: &Device) -> (Option<AxisRange>, Option<AxisRange>) {
    let Ok(abs) = device.get_abs_state() else {
        return (None, None);
    };
    let axis = |a: AbsoluteAxisType| {
        let supported = device
            .supported_absolute_axes()
            .map(|axes| axes.contains(a))
            .unwrap_or(false);
        if !supported {
            return None;
        }
        let info = abs[a.0 as usize];
        AxisRange::new(info.minimum, info.maximum)
    };
    (
        axis(AbsoluteAxisType::ABS_X),
        axis(AbsoluteAxisType::ABS_Y),
    )
}

/// Map a kernel key to its catalog button. Face buttons follow the
/// Nintendo layout of the target handhelds: A is east, B south, X north,
/// Y west. Keyboard-style arrow keys cover devices whose dpad is wired as
/// a keypad.
fn key_button(key: Key) -> Option<Button> {
    match key {
        Key::BTN_EAST => Some(Button::A),
        Key::BTN_SOUTH => Some(Button::B),
        Key::BTN_NORTH => Some(Button::X),
        Key::BTN_WEST => Some(Button::Y),
        Key::BTN_DPAD_UP | Key::KEY_UP => Some(Button::DpadUp),
        Key::BTN_DPAD_DOWN | Key::KEY_DOWN => Some(Button::DpadDown),
        Key::BTN_DPAD_LEFT | Key::KEY_LEFT => Some(Button::DpadLeft),
        Key::BTN_DPAD_RIGHT | Key::KEY_RIGHT => Some(Button::DpadRight),
        Key::BTN_TL => Some(Button::L1),
        Key::BTN_TR => Some(Button::R1),
        Key::BTN_TL2 => Some(Button::L2),
        Key::BTN_TR2 => Some(Button::R2),
        Key::BTN_THUMBL => Some(Button::L3),
        Key::BTN_THUMBR => Some(Button::R3),
        Key::BTN_START => Some(Button::Start),
        Key::BTN_SELECT => Some(Button::Select),
        Key::BTN_MODE => Some(Button::Menu),
        Key::KEY_VOLUMEUP => Some(Button::Plus),
        Key::KEY_VOLUMEDOWN => Some(Button::Minus),
        Key::KEY_POWER => Some(Button::Power),
        Key::KEY_POWER2 => Some(Button::Poweroff),
        _ => None,
    }
}

/// `BTN_UP`..`BTN_RIGHT` name the same physical controls as the dpad
/// entries; queries for either resolve to one tracked button.
fn canonical(button: Button) -> Button {
    match button {
        Button::Up => Button::DpadUp,
        Button::Down => Button::DpadDown,
        Button::Left => Button::DpadLeft,
        Button::Right => Button::DpadRight,
        other => other,
    }
}

/// Analog thresholds: a direction counts as pressed past the midpoint
/// between center and extreme.
#[derive(Debug, Clone, Copy)]
struct AxisRange {
    low: i32,
    high: i32,
}

impl AxisRange {
    fn new(minimum: i32, maximum: i32) -> Option<Self> {
        if maximum <= minimum {
            return None;
        }
        let mid = (minimum + maximum) / 2;
        let dead = (maximum - minimum) / 4;
        Some(Self {
            low: mid - dead,
            high: mid + dead,
        })
    }

    fn classify(self, value: i32) -> i32 {
        if value <= self.low {
            -1
        } else if value >= self.high {
            1
        } else {
            0
        }
    }
}

/// When a held button's next synthesized repeat is due.
#[derive(Debug, Clone, Copy)]
struct Hold {
    next_repeat: Instant,
}

/// Per-tick snapshot folded from raw events.
///
/// Edge sets (`went_down`, `went_up`, `repeats`) describe only the current
/// sample and are rebuilt on every refresh; `pressed` carries the running
/// level state across ticks. A press-and-release inside one tick therefore
/// reads as both just-pressed and just-released while not held, matching
/// how the event stream actually looked.
#[derive(Debug, Default)]
struct PadState {
    pressed: HashSet<Button>,
    went_down: HashSet<Button>,
    went_up: HashSet<Button>,
    repeats: HashSet<Button>,
    holds: HashMap<Button, Hold>,
}

impl PadState {
    /// Start a new sample: forget the previous tick's edges.
    fn begin(&mut self) {
        self.went_down.clear();
        self.went_up.clear();
        self.repeats.clear();
    }

    fn key_event(&mut self, key: Key, value: i32, now: Instant) {
        let Some(button) = key_button(key) else {
            return;
        };
        match value {
            0 => self.release(button),
            1 => self.press(button, now),
            // Kernel auto-repeat, on devices that do emit it.
            2 => {
                self.repeats.insert(button);
            }
            _ => {}
        }
    }

    fn axis_event(
        &mut self,
        axis: AbsoluteAxisType,
        value: i32,
        x: Option<AxisRange>,
        y: Option<AxisRange>,
        now: Instant,
    ) {
        match axis {
            AbsoluteAxisType::ABS_HAT0X => {
                self.direction(Button::DpadLeft, Button::DpadRight, value.signum(), now);
            }
            AbsoluteAxisType::ABS_HAT0Y => {
                self.direction(Button::DpadUp, Button::DpadDown, value.signum(), now);
            }
            AbsoluteAxisType::ABS_X => {
                if let Some(range) = x {
                    self.direction(
                        Button::AnalogLeft,
                        Button::AnalogRight,
                        range.classify(value),
                        now,
                    );
                }
            }
            AbsoluteAxisType::ABS_Y => {
                if let Some(range) = y {
                    self.direction(
                        Button::AnalogUp,
                        Button::AnalogDown,
                        range.classify(value),
                        now,
                    );
                }
            }
            _ => {}
        }
    }

    /// Fire synthesized repeats for buttons held past their schedule.
    fn settle(&mut self, now: Instant) {
        for (button, hold) in &mut self.holds {
            if now >= hold.next_repeat {
                self.repeats.insert(*button);
                hold.next_repeat = now + REPEAT_INTERVAL;
            }
        }
    }

    fn press(&mut self, button: Button, now: Instant) {
        if self.pressed.insert(button) {
            self.went_down.insert(button);
            // The initial press counts as the first repeat.
            self.repeats.insert(button);
            self.holds.insert(
                button,
                Hold {
                    next_repeat: now + REPEAT_DELAY,
                },
            );
        }
    }

    fn release(&mut self, button: Button) {
        if self.pressed.remove(&button) {
            self.went_up.insert(button);
            self.holds.remove(&button);
        }
    }

    fn direction(&mut self, negative: Button, positive: Button, sign: i32, now: Instant) {
        if sign < 0 {
            self.press(negative, now);
            self.release(positive);
        } else if sign > 0 {
            self.press(positive, now);
            self.release(negative);
        } else {
            self.release(negative);
            self.release(positive);
        }
    }

    fn just_pressed(&self, button: Button) -> bool {
        self.went_down.contains(&canonical(button))
    }

    fn is_pressed(&self, button: Button) -> bool {
        self.pressed.contains(&canonical(button))
    }

    fn just_released(&self, button: Button) -> bool {
        self.went_up.contains(&canonical(button))
    }

    fn just_repeated(&self, button: Button) -> bool {
        self.repeats.contains(&canonical(button))
    }
}

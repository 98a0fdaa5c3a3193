//! Full-frame UI rendering
//!
//! ```text
//! ╭───────────────────────────╮
//! │          HEADER           │  y = 5
//! │ ───────────────────────── │  y = 16
//! │          body             │  y = 20..
//! ╰───────────────────────────╯
//! ```

use core::fmt::Write;

use heapless::String;

use super::layout::distribute;
use crate::context::AppContext;
use crate::sensor::{EditMagnitude, SensorArray};
use crate::state::{Mode, SystemStateMachine};
use crate::traits::{
    Color, DisplayDriver, DisplayError, DisplayExt, ImmediateTransport, PhasedTransport,
    RelayOutput,
};

const HEADER_Y: u8 = 5;

/// Character cell width at text size 1
const GLYPH: u8 = 6;

/// Draw the current mode and push the frame
pub fn draw<D, I, P, R, const N: usize>(
    display: &mut D,
    machine: &SystemStateMachine,
    ctx: &AppContext,
    sensors: &SensorArray<I, P, R, N>,
) -> Result<(), DisplayError>
where
    D: DisplayDriver,
    I: ImmediateTransport,
    P: PhasedTransport,
    R: RelayOutput,
{
    display.clear();
    display.rounded_rect(0, 0, 127, 63, 7, Color::White);
    display.line(9, 16, 117, 16, Color::White);
    display.set_text_color(Color::White, None);
    display.set_text_size(1);

    match machine.mode() {
        Mode::Error => draw_error(display, ctx),
        Mode::Info => draw_info(display, ctx, sensors),
        Mode::Menu => draw_menu(display, machine, ctx),
        Mode::SetVacuum => draw_set_vacuum(display, sensors),
    }

    display.flush()
}

fn draw_error<D: DisplayDriver>(display: &mut D, ctx: &AppContext) {
    display.print_centered("ERROR", 1, HEADER_Y);
    display.print_centered(ctx.error().message(), 1, 20);
    display.print_centered("Push to reinit", 1, 50);
}

fn draw_info<D, I, P, R, const N: usize>(
    display: &mut D,
    ctx: &AppContext,
    sensors: &SensorArray<I, P, R, N>,
) where
    D: DisplayDriver,
    I: ImmediateTransport,
    P: PhasedTransport,
    R: RelayOutput,
{
    let status = if ctx.is_active() {
        "STATUS:ACTIVE"
    } else {
        "STATUS:IDLE"
    };
    display.print_centered(status, 1, HEADER_Y);

    let count = sensors.count() as u8;
    let width = display.width();

    // Labels: "S0", "S1", ...
    const LABEL_LEN: u8 = GLYPH * 2;
    const LABEL_OFFSET: u8 = 10;
    let span = width.saturating_sub(LABEL_OFFSET);
    for i in 0..count {
        let x = distribute(i, count, LABEL_LEN, span).saturating_add(LABEL_OFFSET);
        display.set_cursor(x, 20);
        display.print("S");
        display.print_number(u32::from(i));
    }

    const PRESSURE_ROW: u8 = 35;
    const TEMPERATURE_ROW: u8 = 48;
    display.set_cursor(10, PRESSURE_ROW);
    display.print("P:");
    display.set_cursor(10, TEMPERATURE_ROW);
    display.print("T:");

    // Room for "000.00"
    const VALUE_LEN: u8 = GLYPH * 6;
    const VALUE_OFFSET: u8 = 12;
    let span = width.saturating_sub(VALUE_OFFSET);
    for (i, sensor) in sensors.iter().enumerate() {
        let x = distribute(i as u8, count, VALUE_LEN, span).saturating_add(VALUE_OFFSET);
        display.set_cursor(x, PRESSURE_ROW);
        display.print_value(sensor.pressure());
        display.set_cursor(x, TEMPERATURE_ROW);
        display.print_value(sensor.temperature());
    }
}

fn draw_menu<D: DisplayDriver>(display: &mut D, machine: &SystemStateMachine, ctx: &AppContext) {
    display.print_centered("SETTINGS", 1, HEADER_Y);

    const X_START: u8 = 12;
    const Y_START: u8 = 20;
    const Y_STEP: u8 = 10;

    let menu = machine.menu();
    let category = menu.category();
    for i in 0..category.item_count() {
        display.set_cursor(X_START, Y_START + i * Y_STEP);
        display.print(if i == menu.item_index() { "> " } else { "  " });
        display.print(category.label(i, ctx.is_active()));
    }
}

fn draw_set_vacuum<D, I, P, R, const N: usize>(display: &mut D, sensors: &SensorArray<I, P, R, N>)
where
    D: DisplayDriver,
    I: ImmediateTransport,
    P: PhasedTransport,
    R: RelayOutput,
{
    let header = if sensors.current_index() == 0 {
        "SET TOP PRESSURE"
    } else {
        "SET BOTTOM PRESSURE"
    };
    display.print_centered(header, 1, HEADER_Y);

    let marker_x = match sensors.edit_magnitude() {
        EditMagnitude::Ones => 26,
        EditMagnitude::Tenths => 62,
        EditMagnitude::Hundredths => 80,
    };
    display.rect(marker_x, 25, 3 * GLYPH + 1, 27, Color::White);

    if let Some(sensor) = sensors.current() {
        let mut value: String<16> = String::new();
        if write!(value, "{:.2}", sensor.target()).is_ok() {
            display.print_centered(&value, 3, 28);
        }
    }
}

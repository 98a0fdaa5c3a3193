//! Control loop task
//!
//! Plays the splash, initializes the sensors, then runs one controller
//! tick and one redraw per tick interval.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker, Timer};
use solidfill_core::ui::splash;
use solidfill_core::ui::SPLASH_FRAMES;

use crate::board::{Board, Display};
use crate::channels::EDGES;

#[embassy_executor::task]
pub async fn control_task(mut controller: Board, mut display: Display) {
    info!("Control task started");

    if controller.config().splash {
        play_splash(&mut display).await;
    }

    match controller.start() {
        Ok(()) => info!("{} sensor(s) initialized", controller.sensors().count()),
        Err(e) => error!("Sensor init failed: {:?}", e),
    }

    let interval = u64::from(controller.config().tick_interval_ms);
    let mut ticker = Ticker::every(Duration::from_millis(interval));
    let mut mode = controller.mode();
    let mut faulted = controller.context().error().is_set();

    loop {
        let input = EDGES.take();
        let now_ms = Instant::now().as_millis() as u32;
        controller.tick(input, now_ms);
        trace!("Tick at {} ms: {:?}", now_ms, input);

        let error = controller.context().error();
        if error.is_set() && !faulted {
            error!("Controller error: {=str}", error.message());
        }
        faulted = error.is_set();

        if controller.mode() != mode {
            mode = controller.mode();
            info!("Mode: {:?}", mode);
        }

        if let Err(e) = controller.render(&mut display) {
            warn!("Display update failed: {:?}", e);
        }

        ticker.next().await;
    }
}

async fn play_splash(display: &mut Display) {
    splash::begin(display);
    for frame in SPLASH_FRAMES.iter() {
        if let Err(e) = splash::draw_frame(display, frame) {
            warn!("Splash frame failed: {:?}", e);
        }
        Timer::after(Duration::from_millis(u64::from(frame.hold_ms))).await;
    }
}

//! Encoder push button task

use defmt::*;
use embassy_stm32::exti::ExtiInput;
use embassy_time::{Duration, Timer};

use crate::channels::EDGES;

#[embassy_executor::task]
pub async fn button_task(mut btn: ExtiInput<'static>, debounce_ms: u32) {
    info!("Button task started");

    let debounce = Duration::from_millis(u64::from(debounce_ms));

    loop {
        btn.wait_for_falling_edge().await;
        Timer::after(debounce).await;

        if btn.is_low() {
            EDGES.record_click();
            debug!("Button: Click");

            btn.wait_for_rising_edge().await;
            Timer::after(debounce).await;
        }
    }
}

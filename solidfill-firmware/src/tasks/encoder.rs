//! Encoder rotation task

use defmt::*;
use solidfill_hal_stm32f1::EncoderPin;

use crate::channels::EDGES;
use crate::encoder::Encoder;

#[embassy_executor::task]
pub async fn encoder_task(mut encoder: Encoder<EncoderPin<'static>, EncoderPin<'static>>) {
    info!("Encoder task started");

    loop {
        if let Some(step) = encoder.poll().await {
            EDGES.record_step(step.delta());
            trace!("Encoder: {}", step.delta());
        }
    }
}

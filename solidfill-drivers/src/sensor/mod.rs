//! Barometric transducer drivers
//!
//! Both parts are Bosch barometers on I2C. The BMP280 runs free in normal
//! mode and answers immediately; the BMP180 needs a conversion command and
//! a datasheet delay for every reading.

pub mod bmp180;
pub mod bmp280;

pub use bmp180::Bmp180;
pub use bmp280::Bmp280;

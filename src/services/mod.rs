pub mod cascade;
pub mod lookup;
pub mod sensor_cap;

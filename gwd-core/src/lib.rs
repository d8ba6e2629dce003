pub mod component;
pub mod error;
pub mod geo_point;
pub mod observation;
pub mod region;
pub mod table;
pub mod well_record;

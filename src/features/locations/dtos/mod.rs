mod location_dto;

pub use location_dto::{
    CreateLocationDto, CreatedLocationDto, LocationResponseDto, SearchLocationsQuery,
};

//! Clients for services the engine calls out to

mod forecast_service;

pub use forecast_service::{
    ForecastServiceClient, ForecastServiceRequest, HttpForecastServiceClient,
    MockForecastServiceClient,
};

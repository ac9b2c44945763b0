pub mod fifa_fixtures;
pub mod predictor_api;

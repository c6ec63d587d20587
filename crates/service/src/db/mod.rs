pub mod restaurant_service;

//! HTTP daemon for the Solar Suite: energy estimation routes backed by
//! [`solar_energy::Service`] and user registration backed by a
//! [`users::UserStore`].

pub mod http_server;
pub mod users;

mod helpers;
mod jwt;

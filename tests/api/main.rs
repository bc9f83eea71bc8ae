mod authentication;
mod body;
mod compression;
mod cookies;
mod health_check;

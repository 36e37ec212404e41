mod helpers;
mod info;
mod mocks;
mod orders;
mod payment_status;
mod webhook;

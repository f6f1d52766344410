/*
This module is home to the provisioning chain: the ordered fallback
sequence that turns device identifiers into platform credentials.

The chain asks the credentials service for a bundle using the strongest
identifier available, hands the first resolved bundle to the session
layer and otherwise drops the device into configuration mode.
*/

mod fallback;
mod lookup;

pub use fallback::{Provisioned, Provisioner};

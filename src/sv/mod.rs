pub mod code;
pub mod influencer;
pub mod ledger;
pub mod payout;
pub mod sale;
pub mod settlement;
#[cfg(test)]
pub mod test_utils;

pub use code::Code;
pub use influencer::Influencer;
pub use ledger::Ledger;
pub use payout::Payout;
pub use sale::Sale;
pub use settlement::Settlement;

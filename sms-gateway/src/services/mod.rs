pub mod providers;

pub use providers::{
    MockSmsProvider, ProviderError, ProviderResponse, SmsMessage, SmsProvider, TwilioProvider,
};

mod diagnostics;
mod registry;
mod round_trip;

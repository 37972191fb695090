// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod window_backpressure_tests;
mod window_cancel_tests;
mod window_exact_tests;
mod window_overlap_tests;
mod window_skip_tests;

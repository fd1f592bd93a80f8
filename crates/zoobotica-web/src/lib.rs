//! # Zoobotica Web
//!
//! HTTP server for the Zoobotica designer.
//!
//! ## Quick Start
//!
//! ```bash
//! GOOGLE_API_KEY=... STABILITY_API_KEY=... cargo run -p zoobotica-web -- --port 3000
//!
//! # or with canned backends
//! cargo run -p zoobotica-web -- --mock
//! ```
//!
//! ## API Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/api/chat` | Design assistant reply |
//! | POST | `/api/generate` | Design description for the questionnaire |
//! | POST | `/api/recommendations` | Trait recommendations per robot system |
//! | POST | `/api/traits/generate` | Invent a trait in a category |
//! | POST | `/api/generate-image` | Text-to-image relay |
//! | POST | `/api/analyze-performance` | Demo performance analysis |
//! | GET | `/api/catalog?q=` | Trait library |
//! | GET | `/api/assembly` | The six body parts |
//! | POST | `/api/assembly/:slot/drop` | Drop a trait onto a slot |
//! | GET | `/api/session/recommendations` | Latest recommendations |
//! | GET/PUT | `/api/preferences` | Saved questionnaire answers |
//! | GET/PUT | `/api/robot` | Saved simulation robot |
//! | POST | `/api/robot/image` | Render the current assembly |
//! | GET | `/api/robots/base/:env` | Base silhouette frame |
//! | WS | `/ws/simulation?env=` | Render frames and analyses |

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::ApiError;
pub use state::AppState;
pub use store::ProfileStore;

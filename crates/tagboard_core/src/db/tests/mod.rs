//! Database integration tests.

use super::*;
use crate::error::AppError;
use crate::keys::{IndexKey, Namespace};
use crate::models::message::Message;
use crate::tagger::tag_message;
use crate::test_support::{post, setup_temp_db};
use crate::PAGE_SIZE;

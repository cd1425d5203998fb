mod scanner;
mod helpers;
mod math_tokenizer;

pub use scanner::Scanner;
pub use math_tokenizer::{MathTokenizer, MathToken};

pub use helpers::scan_identifier;
pub use helpers::scan_math_op;
pub use helpers::scan_number;

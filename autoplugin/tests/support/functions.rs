//! テスト用の登録対象関数

use autoplugin::plugin_fn;

plugin_fn! {
    /// Adds two numbers
    pub async fn add(a: i64, b: i64) -> i64 {
        a + b
    }
}

plugin_fn! {
    pub async fn hello(name: String, age: i64 = 5) -> String {
        format!("Hello, {}! Age {}.", name, age)
    }
}

plugin_fn! {
    ///
    ///   Raise a number to a power.
    ///
    pub fn pow(base: i64, power: u32 = 2) -> i64 {
        base.pow(power)
    }
}

plugin_fn! {
    pub fn mean(values: Vec<f64>) -> Option<f64> {
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }
}

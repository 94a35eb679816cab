//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

pub const HEADER: &str = "order_id,customer_id,product_category_name,seller_id,review_score,customer_state,customer_city,order_purchase_timestamp,price";

/// Three months of orders across three states, with repeat customers
pub const ORDERS: &str = "\
o01,c1,toys,s1,5,SP,sao paulo,2018-01-03 10:15:00,10.00
o01,c1,toys,s1,5,SP,sao paulo,2018-01-03 10:15:00,12.50
o02,c2,books,s2,4,SP,campinas,2018-01-15 08:00:00,30.00
o03,c3,toys,s1,3,RJ,rio de janeiro,2018-01-20 21:45:00,8.00
o04,c1,garden,s3,,SP,sao paulo,2018-02-02 12:00:00,55.00
o05,c4,books,s2,5,RJ,niteroi,2018-02-10 09:30:00,22.00
o06,c5,music,s4,1,MG,belo horizonte,2018-02-11 17:00:00,5.00
o07,c2,toys,s1,4,SP,campinas,2018-03-01 11:11:11,14.00
o08,c6,art,s5,5,SP,sao paulo,2018-03-05 15:00:00,99.90
o09,c4,food,s2,5,RJ,niteroi,2018-03-09 23:59:59,7.10
";

/// Write a CSV file with the standard header and `body` rows
pub fn write_csv(body: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    if !body.trim().is_empty() {
        writeln!(file, "{}", body.trim_end()).unwrap();
    }
    file.flush().unwrap();
    file
}

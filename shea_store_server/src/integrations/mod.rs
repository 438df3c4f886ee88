pub mod cinetpay;

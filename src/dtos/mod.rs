pub mod orderdtos;
pub mod reviewdtos;
pub mod userdtos;

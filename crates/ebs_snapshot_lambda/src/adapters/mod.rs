pub mod aws_ec2;
pub mod ec2;

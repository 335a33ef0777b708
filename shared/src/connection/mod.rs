pub mod packet_type;

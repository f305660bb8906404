mod locality_properties;
